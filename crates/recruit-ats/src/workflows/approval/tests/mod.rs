mod common;
mod routing;
mod screening;
