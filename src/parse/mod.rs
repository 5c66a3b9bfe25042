pub mod annotation;
pub mod todo_parser;
pub mod todo_serializer;

pub use todo_parser::{parse_task_line, parse_tasks, parse_todo};
pub use todo_serializer::serialize_todo;
