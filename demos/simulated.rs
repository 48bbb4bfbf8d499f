use stickfmt::backends::simulated::SimulatedDevice;
use stickfmt::format::{Aspect, ObjectGuid};
use stickfmt::DeviceFormatConfigurer;

fn main() {
    let device = SimulatedDevice::joystick("sim:demo", "Demo Stick");

    // Inject some sample input
    device.set_axis(ObjectGuid::XAxis, Aspect::Position, 0, 32767);
    device.set_pov(0, Some(9000));
    device.set_button(1, true);

    if let Err(e) = DeviceFormatConfigurer::configure(&device) {
        eprintln!("{}: {e}", device.name());
        return;
    }
    let status = device.acquire();
    if !status.is_success() {
        eprintln!("{}: acquire failed: {status}", device.name());
        return;
    }

    match device.read_joystate() {
        Ok(state) => {
            println!("(Simulated) X = {}", state.x);
            println!("(Simulated) POV0 = {}", state.povs[0]);
            for b in (0..128).filter(|&b| state.button_pressed(b)) {
                println!("(Simulated) Button {b} pressed");
            }
        }
        Err(status) => eprintln!("{}: read failed: {status}", device.name()),
    }

    // Format changes are refused while acquired.
    if let Err(e) = DeviceFormatConfigurer::configure(&device) {
        println!("reconfigure while acquired: {e}");
    }
}
