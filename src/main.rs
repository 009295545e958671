fn main() {
    std::process::exit(commtrack_lib::run());
}
