pub mod product_service_client;
