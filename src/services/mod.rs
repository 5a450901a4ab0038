pub mod opportunity_service;
