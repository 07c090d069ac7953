// linkvault state managers
// Managers own persistent state behind a borrowed database connection.

pub mod bookmark_manager;
