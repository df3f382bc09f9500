use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Table holding one row per embedded chunk.
pub const TABLE_NAME: &str = "chunks";

/// Arrow schema of the chunks table. The vector width is fixed by the
/// embedding provider configured at write time.
pub fn build_arrow_schema(dim: i32) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("start_index", DataType::Int32, false),
        Field::new("content", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim),
            true,
        ),
    ]))
}
