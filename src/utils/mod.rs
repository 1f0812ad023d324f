pub mod output;
pub mod scope_guard;
