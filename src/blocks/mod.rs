pub mod descriptor;
pub mod host;
pub mod lang;
