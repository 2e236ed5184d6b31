pub mod traits;
pub mod defaults;

pub use traits::{KeywordOracle, SectionRenderer, SeedCorpusSource, SuccessPredictor};
pub use defaults::{
    default_keywords, LinearSuccessPredictor, StaticKeywordOracle, StaticSeedCorpus,
    DEFAULT_KEYWORDS,
};
