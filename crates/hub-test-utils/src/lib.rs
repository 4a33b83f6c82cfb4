// hub-test-utils: a mock websocket client used by the root crate's
// integration tests to drive a real `connection::ws_handler` router end to
// end, the way the teacher's `rt-test-utils` drove `ws_forwarder_handler`.
//
// There is no mock *server* here (unlike the teacher): the thing under test
// is the hub's own router, so tests stand up the real thing and connect
// this client to it rather than emulating server behavior.

pub mod mock_ws_client;

pub use mock_ws_client::{encode_versioned_binary_frame, MockWsClient};
