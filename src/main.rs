use winit::event_loop::{ControlFlow, EventLoop};

use embers::settings::{self, Settings};
use embers::window::App;

fn main() {
    env_logger::init();

    let settings = Settings::load_or_init(settings::DEFAULT_PATH);
    log::info!(
        "starting with {} particles, {} profile",
        settings.max_particles,
        settings.mode.token()
    );

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app).unwrap();
}
