use std::time::{Duration, Instant};

pub fn measure<F, Res>(proc: F) -> (Res, Duration)
where F: FnOnce() -> Res {
    let start = Instant::now();
    let res = proc();
    let time = start.elapsed();
    (res, time)
}
