pub mod aggregator;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod plot;
pub mod reshaper;
pub mod series;
pub mod validator;
