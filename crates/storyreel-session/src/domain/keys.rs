//! Persisted key names. Each is an independent entry holding a string.

/// Decimal id of the page on screen.
pub const CURRENT_PAGE: &str = "currentPage";
/// Decimal id of the last stable page, used to resume.
pub const LAST_READ_PAGE: &str = "lastReadPage";
/// `"vertical"` or `"horizontal"`.
pub const READING_MODE: &str = "readingMode";
/// Decimal in `[0, 1]`.
pub const MUSIC_VOLUME: &str = "musicVolume";
pub const MORALE: &str = "morale";
pub const KERUKA_BOND: &str = "kerukaBond";
pub const KEHINDE_BOND: &str = "kehindeBond";
