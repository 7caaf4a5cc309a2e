/// Fixed-period tick scheduler driven by externally supplied timestamps
/// (milliseconds, e.g. from `requestAnimationFrame`). Stopping it is final.
#[derive(Clone, Debug)]
pub struct SimulationClock {
	period_ms: f64,
	max_catch_up: u32,
	last_ms: Option<f64>,
	backlog_ms: f64,
	running: bool,
}

impl SimulationClock {
	pub fn new(period_ms: f64) -> Self {
		Self {
			period_ms: period_ms.max(1.0),
			max_catch_up: 4,
			last_ms: None,
			backlog_ms: 0.0,
			running: true,
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Number of ticks that fell due between the previous call and `now_ms`.
	/// The first call only records the start time. After a long stall the
	/// backlog is dropped rather than replayed.
	pub fn advance(&mut self, now_ms: f64) -> u32 {
		if !self.running {
			return 0;
		}
		let Some(prev) = self.last_ms.replace(now_ms) else {
			return 0;
		};
		self.backlog_ms += (now_ms - prev).max(0.0);

		let due = (self.backlog_ms / self.period_ms).floor() as u32;
		if due > self.max_catch_up {
			self.backlog_ms = 0.0;
			return self.max_catch_up;
		}
		self.backlog_ms -= due as f64 * self.period_ms;
		due
	}

	pub fn stop(&mut self) {
		self.running = false;
		self.last_ms = None;
		self.backlog_ms = 0.0;
	}
}
