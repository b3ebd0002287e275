// Central place for user-visible strings, wire names and other non-localized constants.
// Keep these out of the sync components to reduce duplication and make tweaks safer.

// Settle windows (milliseconds).
pub const SEARCH_SETTLE_MS: u64 = 300;
pub const SAVE_SETTLE_MS: u64 = 1000;

// Naming conventions shared with the store.
pub const SUPPLIER_ID_PREFIX: &str = "SUP_";
pub const EXPORT_FILE_PREFIX: &str = "suppliers_";
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const IMPORT_EXTENSION: &str = "xlsx";
pub const IMPORT_FILTER_NAME: &str = "Excel";

// Id sent as the uniqueness-check exclusion while a supplier is still being created.
pub const NO_SUPPLIER_ID: &str = "";

// Separators accepted inside the free-text email list.
pub const EMAIL_SEPARATORS: &[char] = &[';', ','];

// Remote command names (CMD_ prefix).
pub const CMD_SEARCH: &str = "search_suppliers_data";
pub const CMD_UPSERT: &str = "update_supplier_data";
pub const CMD_CREATE: &str = "create_supplier";
pub const CMD_CHECK_PO: &str = "check_po_exists";
pub const CMD_VALIDATE_IMPORT: &str = "validate_supplier_import";
pub const CMD_IMPORT: &str = "import_suppliers";
pub const CMD_EXPORT: &str = "export_suppliers";
pub const CMD_GET_PLANNERS: &str = "get_planners";
pub const CMD_GET_CONTINUITY: &str = "get_continuity_options";
pub const CMD_GET_SOURCING: &str = "get_sourcing_options";
pub const CMD_GET_SQIE: &str = "get_sqie_options";
pub const CMD_GET_BUSINESS_UNITS: &str = "get_business_units";
pub const CMD_GET_CATEGORIES: &str = "get_categories";

// Supplier wire field names (FIELD_ prefix).
pub const FIELD_PO: &str = "supplier_po";
pub const FIELD_BU: &str = "bu";
pub const FIELD_EMAIL: &str = "supplier_email";
pub const FIELD_STATUS: &str = "supplier_status";
pub const FIELD_PLANNER: &str = "planner";
pub const FIELD_COUNTRY: &str = "country";
pub const FIELD_CATEGORY: &str = "supplier_category";
pub const FIELD_CONTINUITY: &str = "continuity";
pub const FIELD_SOURCING: &str = "sourcing";
pub const FIELD_SQIE: &str = "sqie";
pub const FIELD_SSID: &str = "ssid";
pub const FIELD_OTIF_TARGET: &str = "otif_target";
pub const FIELD_NIL_TARGET: &str = "nil_target";
pub const FIELD_PICKUP_TARGET: &str = "pickup_target";
pub const FIELD_PACKAGE_TARGET: &str = "package_target";

// English notice strings (EN_ prefix to make future localization easier)
pub const EN_SEARCH_FAILED: &str = "Failed to search suppliers";
pub const EN_SAVE_FAILED: &str = "Failed to save supplier";
pub const EN_SUPPLIER_UPDATED: &str = "Supplier updated";
pub const EN_SUPPLIER_CREATED: &str = "Supplier created";
pub const EN_CREATE_FAILED: &str = "Failed to create supplier";
pub const EN_NAME_REQUIRED: &str = "Supplier name is required";
pub const EN_ORIGIN_REQUIRED: &str = "Origin is required";
pub const EN_EDIT_DISABLED: &str = "Editing is disabled for this session";
pub const EN_IMPORT_NOT_VALIDATED: &str = "Select and validate a file before importing";
pub const EN_IMPORT_NO_FILE: &str = "No file selected";
pub const EN_IMPORT_INVALID: &str = "Import file is invalid";
pub const EN_IMPORT_DONE: &str = "Import finished";
pub const EN_IMPORT_FAILED: &str = "Import failed";
pub const EN_IMPORT_ROW_ERRORS: &str = "rows failed to import; review them manually";
pub const EN_EXPORT_DONE: &str = "Suppliers exported to";
pub const EN_EXPORT_FAILED: &str = "Failed to export suppliers";
pub const EN_LABEL_UPDATED: &str = "Updated:";
pub const EN_LABEL_INSERTED: &str = "Inserted:";
pub const EN_LABEL_ERRORS: &str = "Errors:";
