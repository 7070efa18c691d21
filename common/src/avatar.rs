/// Fixed palette for chat avatars. Selection hashes the author id, so an
/// author keeps the same colour across sessions and across clients.
pub const AVATAR_COLORS: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

/// Order-dependent character fold (`h * 31 + c` written as shift-and-
/// subtract), wrapping at 32 bits.
fn identity_hash(seed: &str) -> i32 {
    let mut hash: i32 = 0;
    for c in seed.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(c as i32);
    }
    hash
}

/// Avatar colour for an author id.
pub fn avatar_color(seed: &str) -> &'static str {
    let idx = identity_hash(seed).unsigned_abs() as usize % AVATAR_COLORS.len();
    AVATAR_COLORS[idx]
}

/// Avatar letter (A-Z) for an author id.
pub fn avatar_initial(seed: &str) -> char {
    let idx = identity_hash(seed).unsigned_abs() % 26;
    (b'A' + idx as u8) as char
}
