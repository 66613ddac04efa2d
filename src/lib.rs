pub mod core {
    pub mod command;
    pub mod domain;
    pub mod library;
    pub mod memory;
    pub mod repository;
}

pub mod utils {
    pub mod date;
    pub mod ddb;
}

pub mod circulation;
pub mod items;
pub mod loans;
pub mod policy;
pub mod requests;
