#![no_main]

use game_bridge_client::protocol::{Command, Envelope};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw-byte path, including serde_json's own UTF-8 validation.
    let _ = serde_json::from_slice::<Envelope>(data);

    // The paths the connection loop and command decoding actually take.
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(envelope) = Envelope::decode(text) {
            let _ = envelope.into_command();
        }
        if let Ok(command) = Command::decode(text) {
            // Anything that decodes must encode again.
            let _ = command.encode();
        }
    }
});
