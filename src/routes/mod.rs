pub mod quote_routes;
