pub mod due_date;
pub mod model;
