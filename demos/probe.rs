fn main() {
    match stickfmt::platform_support() {
        Ok(()) => println!("DirectInput 8 available"),
        Err(e) => println!("DirectInput 8 unavailable: {} ({:?})", e, e.status()),
    }
}
