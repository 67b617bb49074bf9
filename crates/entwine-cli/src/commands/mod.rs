pub mod check;
pub mod describe;
pub mod dispatch;
pub mod export;
pub mod generate;
pub mod json_schema;
pub mod record;
pub mod relations;
