use log::{error, info};
use redis::{Client, Commands, Connection};
use snafu::{OptionExt, ResultExt};

use crate::errors::{CustomResult, RaceNotFoundSnafu, SerializationSnafu, StorageSnafu};
use crate::models::NewRace;
use crate::modules::models::race::Race;
use crate::modules::store::RaceStore;

const RACE_IDS_KEY: &str = "races";
const NEXT_RACE_ID_KEY: &str = "race:next_id";

pub struct Redis {}

impl Redis {
    pub fn connect(client: &Client) -> CustomResult<Connection> {
        client.get_connection().context(StorageSnafu { action: "connecting to redis" })
    }

    pub fn race_key(race_id: i32) -> String {
        format!("race:{}", race_id)
    }
}

/// # races stored in redis
/// every race is a json string under `race:<id>`, the ids of all races are
/// kept in the `races` set.
pub struct RedisRaceStore {
    client: Client,
}

impl RedisRaceStore {
    /// # open a store on a redis server
    ///
    /// ## Arguments
    /// * `redis_url` - e.g. `redis://127.0.0.1/`
    ///
    /// ## Returns
    /// * `RedisRaceStore` - the store; no connection is made until first use
    pub fn open(redis_url: &str) -> CustomResult<RedisRaceStore> {
        let client = Client::open(redis_url).context(StorageSnafu { action: "opening redis client" })?;
        info!(target: "modules/redis:open", "using redis race store at {}", redis_url);

        Ok(RedisRaceStore { client })
    }

    fn write(&self, conn: &mut Connection, race: &Race) -> CustomResult<()> {
        let data = serde_json::to_string(race)
            .context(SerializationSnafu { what: format!("race {}", race.id) })?;

        conn.set::<_, _, ()>(Redis::race_key(race.id), data)
            .context(StorageSnafu { action: format!("saving race {}", race.id) })?;
        conn.sadd::<_, _, ()>(RACE_IDS_KEY, race.id)
            .context(StorageSnafu { action: format!("indexing race {}", race.id) })
    }
}

impl RaceStore for RedisRaceStore {
    fn insert(&self, new_race: NewRace) -> CustomResult<Race> {
        let conn = &mut Redis::connect(&self.client)?;

        let id: i32 = conn
            .incr(NEXT_RACE_ID_KEY, 1)
            .context(StorageSnafu { action: "reserving a race id" })?;

        let race = Race::new(id, new_race);
        self.write(conn, &race)?;

        Ok(race)
    }

    fn load(&self, race_id: i32) -> CustomResult<Race> {
        let conn = &mut Redis::connect(&self.client)?;

        let data: Option<String> = conn
            .get(Redis::race_key(race_id))
            .context(StorageSnafu { action: format!("loading race {}", race_id) })?;
        let data = data.context(RaceNotFoundSnafu { race_id })?;

        serde_json::from_str(&data).context(SerializationSnafu { what: format!("race {}", race_id) })
    }

    fn exists(&self, race_id: i32) -> CustomResult<bool> {
        let conn = &mut Redis::connect(&self.client)?;
        conn.exists::<_, bool>(Redis::race_key(race_id))
            .context(StorageSnafu { action: format!("checking race {}", race_id) })
    }

    fn save(&self, race: &Race) -> CustomResult<()> {
        let conn = &mut Redis::connect(&self.client)?;
        self.write(conn, race)
    }

    fn all(&self) -> CustomResult<Vec<Race>> {
        let mut ids: Vec<i32> = {
            let conn = &mut Redis::connect(&self.client)?;
            conn.smembers(RACE_IDS_KEY)
                .context(StorageSnafu { action: "listing races" })?
        };
        ids.sort_unstable();

        let mut races = Vec::with_capacity(ids.len());
        for race_id in ids {
            match self.load(race_id) {
                Ok(race) => races.push(race),
                Err(error) => {
                    error!(target: "modules/redis:all", "skipping race {}: {}", race_id, error);
                }
            }
        }

        Ok(races)
    }
}
