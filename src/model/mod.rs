mod structured;

pub use structured::StructuredOutput;
