use hidapi::HidApi;
use spacemouse::registry;

fn main() {
    let api = HidApi::new().expect("init hidapi");
    let mut supported = 0;
    for info in api.device_list() {
        let known = registry::lookup(info.vendor_id(), info.product_id());
        if known.is_some() {
            supported += 1;
        }
        println!(
            "VID:PID={:04x}:{:04x} up=0x{:02x} u=0x{:02x} iface={} model={:?} prod={:?} path={}",
            info.vendor_id(),
            info.product_id(),
            info.usage_page(),
            info.usage(),
            info.interface_number(),
            known.map(|d| d.name),
            info.product_string(),
            info.path().to_string_lossy()
        );
    }
    println!("{supported} interface(s) belong to supported SpaceMouse models");
}
