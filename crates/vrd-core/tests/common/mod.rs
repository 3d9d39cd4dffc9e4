pub mod vapi_server;
