// Binary-level tests driving `upreport` through piped stdin
mod arguments;
mod session;
