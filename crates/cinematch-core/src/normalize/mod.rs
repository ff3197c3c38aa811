pub mod canonical;
pub mod variants;

pub use canonical::TitleNormalizer;
pub use variants::{NameVariants, VariantRule, VariantRules};
