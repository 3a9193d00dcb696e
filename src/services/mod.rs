pub mod dynamo;
pub mod s3;
pub mod store;
