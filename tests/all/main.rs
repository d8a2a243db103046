mod context;
mod executor;
mod reflection;
