/*
 * Debug Information Module
 *
 * Per-tick counters a driver can show next to the simulation:
 * - ticks run so far
 * - boids culled and replaced on the last tick, and in total
 * - mean speed across the flock after the last tick
 */

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlockStats {
    pub tick: u64,
    pub replaced_last_tick: usize,
    pub replaced_total: u64,
    pub mean_speed: f64,
}

impl FlockStats {
    pub(crate) fn record_tick(&mut self, replaced: usize, mean_speed: f64) {
        self.tick += 1;
        self.replaced_last_tick = replaced;
        self.replaced_total += replaced as u64;
        self.mean_speed = mean_speed;
    }
}
