//! Blowfish with the bcrypt key schedule extensions.
//!
//! Only what the EksBlowfish primitive needs: the pi-derived initial
//! state, the (optionally salted) key expansion and single block
//! encryption.

mod tables;

use zeroize::Zeroize;

pub(crate) struct Blowfish {
    p: [u32; 18],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    pub(crate) fn init_state() -> Self {
        Blowfish {
            p: tables::P,
            s: tables::S,
        }
    }

    pub(crate) fn encrypt_block(&self, mut left: u32, mut right: u32) -> (u32, u32) {
        for i in 0..16 {
            left ^= self.p[i];
            right ^= self.f(left);
            std::mem::swap(&mut left, &mut right);
        }
        std::mem::swap(&mut left, &mut right);

        right ^= self.p[16];
        left ^= self.p[17];

        (left, right)
    }

    /// Standard Blowfish key schedule on top of the current state.
    ///
    /// `key` must not be empty; its bytes are cycled.
    pub(crate) fn expand_key(&mut self, key: &[u8]) {
        self.mix_key(key);
        self.regenerate(None);
    }

    /// EksBlowfish's salted schedule: like [`Blowfish::expand_key`] but
    /// every block is XORed with the next 64 bits of `salt` before it is
    /// encrypted.
    pub(crate) fn expand_key_with_salt(&mut self, salt: &[u8], key: &[u8]) {
        self.mix_key(key);
        self.regenerate(Some(salt));
    }

    fn mix_key(&mut self, key: &[u8]) {
        let mut pos = 0;
        for p in self.p.iter_mut() {
            *p ^= next_word(key, &mut pos);
        }
    }

    fn regenerate(&mut self, salt: Option<&[u8]>) {
        let mut salt_pos = 0;
        let (mut left, mut right) = (0u32, 0u32);
        let mut next_block = |state: &Blowfish, left: u32, right: u32| match salt {
            Some(salt) => {
                let l = left ^ next_word(salt, &mut salt_pos);
                let r = right ^ next_word(salt, &mut salt_pos);
                state.encrypt_block(l, r)
            }
            None => state.encrypt_block(left, right),
        };

        for i in (0..18).step_by(2) {
            (left, right) = next_block(&*self, left, right);
            self.p[i] = left;
            self.p[i + 1] = right;
        }

        for sbox in 0..4 {
            for i in (0..256).step_by(2) {
                (left, right) = next_block(&*self, left, right);
                self.s[sbox][i] = left;
                self.s[sbox][i + 1] = right;
            }
        }
    }

    fn f(&self, x: u32) -> u32 {
        let a = (x >> 24) as usize;
        let b = ((x >> 16) & 0xff) as usize;
        let c = ((x >> 8) & 0xff) as usize;
        let d = (x & 0xff) as usize;

        (self.s[0][a].wrapping_add(self.s[1][b]) ^ self.s[2][c]).wrapping_add(self.s[3][d])
    }
}

impl Drop for Blowfish {
    fn drop(&mut self) {
        self.p.zeroize();
        self.s.zeroize();
    }
}

// Big-endian word from a cyclic byte stream.
fn next_word(data: &[u8], pos: &mut usize) -> u32 {
    debug_assert!(!data.is_empty());
    let mut word = 0u32;
    for _ in 0..4 {
        word = (word << 8) | u32::from(data[*pos]);
        *pos = (*pos + 1) % data.len();
    }
    word
}
