/*!
   Suspending a failed test so that its networks can be inspected.
*/

use core::time::Duration;
use std::thread::sleep;
use tracing::{error, warn};

use crate::error::Error;

/**
   Run `cont`, and if it fails while `hang_on_fail` is set, log the
   error and suspend the current thread forever instead of returning.

   The caller keeps ownership of the topology for the whole call, so
   nothing is torn down while the test is suspended.
*/
pub fn hang_on_error<R>(
    hang_on_fail: bool,
    cont: impl FnOnce() -> Result<R, Error>,
) -> Result<R, Error> {
    let result = cont();

    match result {
        Err(e) if hang_on_fail => {
            error!("test failure occured with HANG_ON_FAIL=1, suspending the test to allow debugging: {:?}", e);

            suspend()
        }
        result => result,
    }
}

pub fn suspend() -> ! {
    warn!("suspending the test indefinitely. you can still interact with any spawned chains and relayers");

    loop {
        sleep(Duration::from_secs(999_999_999))
    }
}
