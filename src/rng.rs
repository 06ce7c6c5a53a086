#![doc = include_str!("../docs/rng.md")]
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{SimulationError, WeightedChoiceError};

type HmacSha256 = Hmac<Sha256>;

// Seed sizes for the commit-reveal protocol, in raw bytes before hex encoding
const SERVER_SEED_BYTES: usize = 32;
const CLIENT_SEED_BYTES: usize = 16;

// 2^32 as a float, the divisor mapping a u32 draw into [0, 1)
const U32_RANGE: f64 = 4294967296.0_f64;

/// # `ProvablyFairRng` struct
///
/// A `ProvablyFairRng` is a deterministic random generator chained off
/// `HMAC-SHA256(server_seed, client_seed ":" nonce)`. The nonce increases by
/// exactly one per primitive draw, so a third party holding both seeds can
/// recompute every value the simulation consumed.
#[derive(Clone, Debug)]
pub struct ProvablyFairRng {
    server_seed: String,
    client_seed: String,
    nonce: u64,
}

impl ProvablyFairRng {
    /// Initialize a new generator from a seed pair
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let my_rng = ProvablyFairRng::new("a-server-seed", "a-client-seed").unwrap();
    /// assert!(my_rng.nonce() == 0);
    /// ```
    pub fn new(server_seed: &str, client_seed: &str) -> Result<ProvablyFairRng, SimulationError> {
        if server_seed.is_empty() {
            return Err(SimulationError::InvalidSeed(String::from(
                "server seed is empty",
            )));
        }
        if client_seed.is_empty() {
            return Err(SimulationError::InvalidSeed(String::from(
                "client seed is empty",
            )));
        }
        Ok(ProvablyFairRng {
            server_seed: String::from(server_seed),
            client_seed: String::from(client_seed),
            nonce: 0,
        })
    }

    /// Get the generator's server seed
    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    /// Get the generator's client seed
    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Get the number of primitive draws consumed so far
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let mut my_rng = ProvablyFairRng::new("server", "client").unwrap();
    /// my_rng.random();
    /// assert!(my_rng.nonce() == 1);
    /// ```
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Draw the next float in [0, 1), consuming one nonce
    ///
    /// Computes `HMAC-SHA256(server_seed, client_seed ":" nonce)`, takes the
    /// first four digest bytes big-endian as a u32 and divides by 2^32.
    pub fn random(&mut self) -> f64 {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(self.client_seed.as_bytes());
        mac.update(b":");
        mac.update(self.nonce.to_string().as_bytes());
        let digest = mac.finalize().into_bytes();
        let value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        self.nonce += 1;
        value as f64 / U32_RANGE
    }

    /// Draw an integer uniformly from [min, max], inclusive on both ends
    ///
    /// Consumes exactly one draw.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let mut my_rng = ProvablyFairRng::new("server", "client").unwrap();
    /// let roll = my_rng.random_int(1, 6);
    /// assert!((1..=6).contains(&roll));
    /// ```
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let r = self.random();
        (r * ((max - min + 1) as f64)).floor() as i32 + min
    }

    /// Draw a float uniformly from [min, max)
    ///
    /// Consumes exactly one draw.
    pub fn random_float(&mut self, min: f64, max: f64) -> f64 {
        let r = self.random();
        r * (max - min) + min
    }

    /// Roll an event with probability `p`
    ///
    /// Returns `false` without a draw when `p <= 0`, `true` without a draw
    /// when `p >= 1`, otherwise consumes one draw.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let mut my_rng = ProvablyFairRng::new("server", "client").unwrap();
    /// assert!(!my_rng.probability(0.0));
    /// assert!(my_rng.probability(1.0));
    /// assert!(my_rng.nonce() == 0);
    /// ```
    pub fn probability(&mut self, p: f64) -> bool {
        if p <= 0.0_f64 {
            return false;
        }
        if p >= 1.0_f64 {
            return true;
        }
        self.random() < p
    }

    /// Choose one option from a weighted set, consuming one draw
    ///
    /// The options are scanned cumulatively in order; the final option is
    /// returned on the floating-point edge where the cumulative sum falls
    /// short of the total. Fails without consuming a draw when the set is
    /// empty or its total weight is not positive.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let mut my_rng = ProvablyFairRng::new("server", "client").unwrap();
    /// let options = [("run", 55.0), ("pass", 45.0)];
    /// let pick = my_rng.weighted_choice(&options).unwrap();
    /// assert!(*pick == "run" || *pick == "pass");
    /// ```
    pub fn weighted_choice<'a, T>(
        &mut self,
        options: &'a [(T, f64)],
    ) -> Result<&'a T, WeightedChoiceError> {
        if options.is_empty() {
            return Err(WeightedChoiceError::EmptyOptions);
        }
        let total: f64 = options.iter().map(|(_, w)| w).sum();
        if total <= 0.0_f64 {
            return Err(WeightedChoiceError::NonPositiveWeight);
        }
        let target = self.random() * total;
        let mut cumulative = 0.0_f64;
        for (item, weight) in options.iter() {
            cumulative += weight;
            if target < cumulative {
                return Ok(item);
            }
        }
        // Floating point edge: fall through to the final option
        Ok(&options[options.len() - 1].0)
    }

    /// Produce a Fisher-Yates shuffled copy of a sequence
    ///
    /// Draws once per index from n-1 down to 1; a sequence of length 0 or 1
    /// consumes no draws.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled: Vec<T> = items.to_vec();
        if shuffled.len() < 2 {
            return shuffled;
        }
        for i in (1..shuffled.len()).rev() {
            let j = self.random_int(0, i as i32) as usize;
            shuffled.swap(i, j);
        }
        shuffled
    }

    /// Sample a normally distributed value via the Box-Muller transform
    ///
    /// Consumes two draws; if the first draw lands exactly on zero it is
    /// redrawn (the second draw is never redrawn). The transformed value is
    /// clamped to `[min, max]` where bounds are given.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let mut my_rng = ProvablyFairRng::new("server", "client").unwrap();
    /// let yards = my_rng.gaussian(4.0, 3.5, Some(-5.0), Some(30.0));
    /// assert!((-5.0..=30.0).contains(&yards));
    /// ```
    pub fn gaussian(&mut self, mean: f64, std_dev: f64, min: Option<f64>, max: Option<f64>) -> f64 {
        let mut u1 = self.random();
        let u2 = self.random();
        while u1 == 0.0_f64 {
            u1 = self.random();
        }
        let z = (-2.0_f64 * u1.ln()).sqrt() * (2.0_f64 * std::f64::consts::PI * u2).cos();
        let mut value = mean + (z * std_dev);
        if let Some(lo) = min {
            value = value.max(lo);
        }
        if let Some(hi) = max {
            value = value.min(hi);
        }
        value
    }
}

/// Generate a fresh 64-hex-character server seed from the OS CSPRNG
///
/// ### Example
/// ```
/// use gridiron_core::rng::generate_server_seed;
///
/// let seed = generate_server_seed();
/// assert!(seed.len() == 64);
/// ```
pub fn generate_server_seed() -> String {
    let mut bytes = [0u8; SERVER_SEED_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a fresh 32-hex-character client seed from the OS CSPRNG
///
/// ### Example
/// ```
/// use gridiron_core::rng::generate_client_seed;
///
/// let seed = generate_client_seed();
/// assert!(seed.len() == 32);
/// ```
pub fn generate_client_seed() -> String {
    let mut bytes = [0u8; CLIENT_SEED_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compute the SHA-256 hex digest of a server seed, published before the game
pub fn hash_server_seed(server_seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a revealed server seed against its published hash
///
/// ### Example
/// ```
/// use gridiron_core::rng::{hash_server_seed, verify_server_seed};
///
/// let hash = hash_server_seed("my-seed");
/// assert!(verify_server_seed("my-seed", &hash));
/// assert!(!verify_server_seed("other-seed", &hash));
/// ```
pub fn verify_server_seed(server_seed: &str, hash: &str) -> bool {
    hash_server_seed(server_seed).as_bytes() == hash.as_bytes()
}
