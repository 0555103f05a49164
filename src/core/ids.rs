use rand::RngCore;

/// Opaque record id: `<prefix>-<8 hex digits>`, e.g. `todo-3fa2c1d0`.
pub fn new_id(prefix: &str) -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}-{}", prefix, hex::encode(bytes))
}
