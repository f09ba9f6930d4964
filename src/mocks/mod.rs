// Hardware stand-ins, only compiled during tests.

pub mod mock_clock;
pub mod mock_gpio;
pub mod mock_pwm;
pub mod mock_spi;
