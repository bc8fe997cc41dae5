mod task_record;

pub use task_record::TaskRecord;
