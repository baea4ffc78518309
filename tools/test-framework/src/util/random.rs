/*!
   Random identifiers for test artifacts.
*/

use rand::Rng;

pub fn random_u64() -> u64 {
    let mut rng = rand::thread_rng();
    rng.gen()
}

/// A random hex string, used as a suffix of test directories.
pub fn random_string() -> String {
    format!("{:x}", random_u64())
}
