//! Converter configuration.
//!
//! Merged field-by-field from four tiers:
//! 1. **Defaults** - built in (the "Maratona" → "Contests" rule, São Paulo zone)
//! 2. **Project** - `$CWD/timesheet-jiffy/config.yaml`
//! 3. **User** - `~/.timesheet-jiffy/config.yaml`
//! 4. **Environment** - see below
//!
//! Command-line flags are applied on top by the binary.
//!
//! ## Environment Variables
//! - `TIMESHEET_JIFFY_CONFIG_PATH` - Explicit config file (replaces tiers 2 and 3)
//! - `TIMESHEET_JIFFY_SOURCE` - Timesheet export to read
//! - `TIMESHEET_JIFFY_OUTPUT` - Jiffy database to write
//! - `TIMESHEET_JIFFY_TEMPLATE` - Empty Jiffy database to copy (empty value disables)
//! - `TIMESHEET_JIFFY_USER_DIR` - User config dir (default: `~/.timesheet-jiffy`)
//! - `TIMESHEET_JIFFY_PROJECT_DIR` - Project config dir (default: `./timesheet-jiffy`)
//!
//! ## Example
//! ```yaml
//! paths:
//!   source: Timesheet.xml
//!   template: Jiffy_empty.db
//!   output: Jiffy_LG-D855.db
//! jiffy:
//!   user_id: 1
//!   zone: America/Sao_Paulo
//! rules:
//!   - anchor_project: Maratona
//!     bucket_name: Contests
//!     bucket_status: 0
//!     bucket_color: -3149
//!     tag: Contest
//! ```

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::deep_merge;
pub use types::*;
