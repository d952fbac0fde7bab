/// Context lifecycle for one instance.
///
/// `Uninitialized → Active → Lost → Active` on the happy loss/restore path;
/// initialization failures either retry (editor-like surfaces, where WebGL
/// can race page setup) or land in `FallbackPermanent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Active,
    Lost,
    Retrying,
    FallbackPermanent,
}

/// Bounded retry cadence: a fixed short delay for the first attempts, then a
/// linearly growing delay up to a cap, stopping permanently after a hard
/// attempt limit. The shape is the contract; the constants are tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub fixed_attempts: u32,
    pub fixed_delay_ms: u64,
    pub step_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            fixed_attempts: 3,
            fixed_delay_ms: 300,
            step_ms: 500,
            max_delay_ms: 4000,
            max_attempts: 20,
        }
    }
}

impl RetryPolicy {
    /// Delay after the given 1-based failure count, or `None` once the
    /// attempt budget is spent.
    pub fn delay_after_failure(&self, failures: u32) -> Option<u64> {
        if failures >= self.max_attempts {
            return None;
        }
        if failures <= self.fixed_attempts {
            return Some(self.fixed_delay_ms);
        }
        let extra = u64::from(failures - self.fixed_attempts) * self.step_ms;
        Some((self.fixed_delay_ms + extra).min(self.max_delay_ms))
    }
}

#[derive(Debug)]
pub struct ContextLifecycle {
    state: LifecycleState,
    failures: u32,
    retry_allowed: bool,
    policy: RetryPolicy,
}

impl ContextLifecycle {
    pub fn new(retry_allowed: bool, policy: RetryPolicy) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            failures: 0,
            retry_allowed,
            policy,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Surface creation + compile + first draw succeeded.
    pub fn activated(&mut self) {
        self.state = LifecycleState::Active;
        self.failures = 0;
    }

    /// The environment reported context loss. Restoration is event-driven,
    /// not polled; no retry is scheduled from here.
    pub fn context_lost(&mut self) {
        self.state = LifecycleState::Lost;
    }

    /// The environment reported restoration; the full initialization
    /// sequence runs again from scratch.
    pub fn context_restored(&mut self) {
        self.state = LifecycleState::Uninitialized;
    }

    /// An initialization attempt failed. Returns the delay before the next
    /// attempt, or `None` when the fallback is final (non-retrying
    /// environment, or attempt budget exhausted).
    pub fn init_failed(&mut self) -> Option<u64> {
        if !self.retry_allowed {
            self.state = LifecycleState::FallbackPermanent;
            return None;
        }
        self.failures += 1;
        match self.policy.delay_after_failure(self.failures) {
            Some(delay) => {
                self.state = LifecycleState::Retrying;
                Some(delay)
            }
            None => {
                self.state = LifecycleState::FallbackPermanent;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_then_linear_then_capped() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_after_failure(1), Some(300));
        assert_eq!(p.delay_after_failure(2), Some(300));
        assert_eq!(p.delay_after_failure(3), Some(300));
        assert_eq!(p.delay_after_failure(4), Some(800));
        assert_eq!(p.delay_after_failure(5), Some(1300));
        assert_eq!(p.delay_after_failure(11), Some(4000));
        assert_eq!(p.delay_after_failure(19), Some(4000));
        assert_eq!(p.delay_after_failure(20), None);
    }

    #[test]
    fn test_delays_are_non_decreasing() {
        let p = RetryPolicy::default();
        let mut last = 0;
        for n in 1..p.max_attempts {
            let d = p.delay_after_failure(n).unwrap();
            assert!(d >= last, "failure {n}: {d} < {last}");
            last = d;
        }
    }

    #[test]
    fn test_non_editor_env_fails_permanently_at_once() {
        let mut lc = ContextLifecycle::new(false, RetryPolicy::default());
        assert_eq!(lc.init_failed(), None);
        assert_eq!(lc.state(), LifecycleState::FallbackPermanent);
    }

    #[test]
    fn test_editor_env_retries_until_budget_spent() {
        let mut lc = ContextLifecycle::new(true, RetryPolicy::default());
        let mut delays = Vec::new();
        while let Some(delay) = lc.init_failed() {
            assert_eq!(lc.state(), LifecycleState::Retrying);
            delays.push(delay);
        }
        assert_eq!(delays.len(), 19);
        assert_eq!(lc.state(), LifecycleState::FallbackPermanent);
    }

    #[test]
    fn test_loss_and_restore_cycle() {
        let mut lc = ContextLifecycle::new(true, RetryPolicy::default());
        lc.activated();
        assert_eq!(lc.state(), LifecycleState::Active);
        lc.context_lost();
        assert_eq!(lc.state(), LifecycleState::Lost);
        lc.context_restored();
        assert_eq!(lc.state(), LifecycleState::Uninitialized);
        lc.activated();
        assert_eq!(lc.state(), LifecycleState::Active);
    }

    #[test]
    fn test_activation_resets_failure_count() {
        let mut lc = ContextLifecycle::new(true, RetryPolicy::default());
        lc.init_failed();
        lc.init_failed();
        assert_eq!(lc.failures(), 2);
        lc.activated();
        assert_eq!(lc.failures(), 0);
    }
}
