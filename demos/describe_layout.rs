use stickfmt::{describe, layout_json, EXTENDED_JOYSTICK};

fn main() {
    for ch in describe(&EXTENDED_JOYSTICK).iter().filter(|c| c.offset < 48) {
        println!("{:>3}  {:<8} {:?}", ch.offset, ch.name, ch.kind);
    }

    match layout_json(&EXTENDED_JOYSTICK) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("layout export failed: {e}"),
    }
}
