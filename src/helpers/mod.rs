mod time;

pub use time::{january_first_utc, midnight_utc};

use rand::RngCore;

pub fn rand_hex(bytes: usize) -> String {
    let mut rand = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut rand);
    hex::encode(rand)
}
