pub mod config;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod layout;
pub mod llm_client;
pub mod pipeline;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;
