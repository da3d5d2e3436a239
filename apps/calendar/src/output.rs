use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn to_json<T: Serialize>(data: T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonOut { ok: true, data })?)
}

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", to_json(data)?);
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", to_json(&data)?);
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}
