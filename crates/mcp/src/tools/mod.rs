pub mod install;
pub mod ofrep;
mod registry;

pub use install::InstallSdkTool;
pub use ofrep::OfrepEvalTool;
pub use registry::{
    json_schema_array, json_schema_enum, json_schema_object, json_schema_string, Tool,
    ToolRegistry,
};
