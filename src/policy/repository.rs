pub mod memory_policy_repository;

use crate::core::repository::Repository;
use crate::policy::domain::model::LoanPolicy;

// LoanPolicyRepository serves policies resolved by the circulation rules of another service
pub trait LoanPolicyRepository: Repository<LoanPolicy> {}
