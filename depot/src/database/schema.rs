//! Database schema definitions and SQL constants.

/// Current schema version, stored in the metadata table.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Key-value store for schema versioning.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// The item catalog.
pub const CREATE_ITEMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        length_meters REAL NOT NULL,
        width_meters REAL NOT NULL,
        height_meters REAL NOT NULL,
        weight_kg REAL NOT NULL
    )";

/// Storehouses and their locations.
pub const CREATE_STOREHOUSES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS storehouses (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL
    )";

/// Unreserved stock per storehouse. Zero counts are never stored.
pub const CREATE_STOREHOUSE_ITEMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS storehouse_items (
        storehouse_id TEXT NOT NULL REFERENCES storehouses(id) ON DELETE CASCADE,
        item_id TEXT NOT NULL REFERENCES items(id),
        items_count INTEGER NOT NULL CHECK (items_count > 0),
        PRIMARY KEY (storehouse_id, item_id)
    )";

/// Reservation headers.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id TEXT PRIMARY KEY NOT NULL,
        destination_latitude REAL NOT NULL,
        destination_longitude REAL NOT NULL,
        released_units INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Reservation entries in allocation order.
///
/// Item and storehouse ids are plain values: a reservation outlives
/// catalog and storehouse edits.
pub const CREATE_RESERVATION_ITEMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservation_items (
        reservation_id TEXT NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        item_id TEXT NOT NULL,
        storehouse_id TEXT NOT NULL,
        items_count INTEGER NOT NULL CHECK (items_count > 0),
        PRIMARY KEY (reservation_id, position)
    )";

/// Speeds up loading the stock of every storehouse holding an item.
pub const CREATE_STOREHOUSE_ITEMS_ITEM_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_storehouse_items_item ON storehouse_items(item_id)";

/// Speeds up listing reservations newest first.
pub const CREATE_RESERVATIONS_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_created ON reservations(created_at)";

/// Selects the schema version.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// Inserts or updates the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Table creation statements in dependency order.
pub const CREATE_TABLES: [&str; 6] = [
    CREATE_METADATA_TABLE,
    CREATE_ITEMS_TABLE,
    CREATE_STOREHOUSES_TABLE,
    CREATE_STOREHOUSE_ITEMS_TABLE,
    CREATE_RESERVATIONS_TABLE,
    CREATE_RESERVATION_ITEMS_TABLE,
];

/// Index creation statements.
pub const CREATE_INDICES: [&str; 2] = [
    CREATE_STOREHOUSE_ITEMS_ITEM_INDEX,
    CREATE_RESERVATIONS_CREATED_INDEX,
];
