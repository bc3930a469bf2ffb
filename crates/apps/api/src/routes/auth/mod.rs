pub mod middlewares;
