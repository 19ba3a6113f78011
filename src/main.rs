use race_the_web::error::AppResult;

fn main() -> AppResult<()> {
    race_the_web::run()
}
