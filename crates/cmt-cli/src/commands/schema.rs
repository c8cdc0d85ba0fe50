use cmt_core::schema;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `commenter schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    match &args.dir {
        Some(dir) => {
            let path = schema::write_schema(dir)?;
            output(&json!({ "schema": path }), flags)
        }
        None => output(&schema::sheet_schema()?, flags),
    }
}
