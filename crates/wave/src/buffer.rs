/// Two equal-length float buffers with toggled roles.
///
/// "Current" holds the settled state at tick `t`. "Next" holds tick `t - 1`
/// until propagation overwrites it with tick `t + 1`; [`PingPong::swap`] then
/// flips the roles without moving any data.
#[derive(Debug, Clone)]
pub struct PingPong {
    buffers: [Vec<f32>; 2],
    current: usize,
}

impl PingPong {
    pub fn new(len: usize) -> Self {
        Self {
            buffers: [vec![0.0; len], vec![0.0; len]],
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The settled buffer.
    pub fn current(&self) -> &[f32] {
        &self.buffers[self.current]
    }

    /// The buffer being written this tick (holds the previous tick until then).
    pub fn next(&self) -> &[f32] {
        &self.buffers[1 - self.current]
    }

    pub fn current_mut(&mut self) -> &mut [f32] {
        &mut self.buffers[self.current]
    }

    pub fn next_mut(&mut self) -> &mut [f32] {
        &mut self.buffers[1 - self.current]
    }

    /// Read access to current alongside write access to next.
    pub fn split_mut(&mut self) -> (&[f32], &mut [f32]) {
        let [a, b] = &mut self.buffers;
        if self.current == 0 {
            (a.as_slice(), b.as_mut_slice())
        } else {
            (b.as_slice(), a.as_mut_slice())
        }
    }

    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    /// Zero both buffers and restore the initial roles.
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0.0);
        }
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_toggles_roles() {
        let mut pp = PingPong::new(4);
        pp.next_mut()[0] = 1.0;
        assert_eq!(pp.current()[0], 0.0);
        pp.swap();
        assert_eq!(pp.current()[0], 1.0);
        assert_eq!(pp.next()[0], 0.0);
        pp.swap();
        assert_eq!(pp.current()[0], 0.0);
    }

    #[test]
    fn split_reads_current_writes_next() {
        let mut pp = PingPong::new(3);
        pp.current_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        {
            let (cur, next) = pp.split_mut();
            for (n, c) in next.iter_mut().zip(cur) {
                *n = c * 10.0;
            }
        }
        pp.swap();
        assert_eq!(pp.current(), &[10.0, 20.0, 30.0]);
        assert_eq!(pp.next(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut pp = PingPong::new(2);
        pp.current_mut()[1] = 5.0;
        pp.swap();
        pp.current_mut()[0] = 3.0;
        pp.clear();
        assert_eq!(pp.current(), &[0.0, 0.0]);
        assert_eq!(pp.next(), &[0.0, 0.0]);
    }
}
