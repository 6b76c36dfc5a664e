mod handlers;
mod routes;

#[cfg(test)]
mod handlers_test;

pub use routes::create_router;
