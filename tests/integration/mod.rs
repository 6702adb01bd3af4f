mod helpers;
mod mock_server;
