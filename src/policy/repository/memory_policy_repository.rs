use crate::core::memory::MemoryRepository;
use crate::policy::domain::model::LoanPolicy;
use crate::policy::repository::LoanPolicyRepository;

pub type MemoryLoanPolicyRepository = MemoryRepository<LoanPolicy>;

impl LoanPolicyRepository for MemoryRepository<LoanPolicy> {}
