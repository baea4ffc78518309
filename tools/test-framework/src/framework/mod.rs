/*!
   Framework code for making it easier to write test cases.

   Test cases implement [`BinaryChannelTest`](binary::channel::BinaryChannelTest)
   together with [`TestOverrides`](overrides::TestOverrides), and are driven
   by [`run_binary_channel_test`](binary::channel::run_binary_channel_test),
   which sets up the topology before running the test and tears it down
   afterwards.
*/

pub mod base;
pub mod binary;
pub mod overrides;
pub mod transfer;
