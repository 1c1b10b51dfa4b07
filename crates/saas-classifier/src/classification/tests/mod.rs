mod common;
mod metrics;
mod resolver;
mod table;
