pub mod data_source;
pub mod fields;
pub mod fixture_normalizer;
pub mod injury_summarizer;
pub mod pipeline;
pub mod player_filter;
pub mod player_normalizer;
pub mod result_reconstructor;
pub mod team_aggregator;
pub mod team_views;
#[cfg(test)]
pub mod test_records;

pub use data_source::*;
pub use fixture_normalizer::*;
pub use injury_summarizer::*;
pub use pipeline::*;
pub use player_filter::*;
pub use player_normalizer::*;
pub use result_reconstructor::*;
pub use team_aggregator::*;
pub use team_views::*;
