fn main() {
    aliens_vs_cowboys::game::run();
}
