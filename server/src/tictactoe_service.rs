use tonic::{Request, Response, Status};

use common::games::tictactoe::Mark;
use common::proto::{self, tic_tac_toe_server::TicTacToe};
use common::{GameId, log};

use crate::game_store::{GameStore, StoreError};

impl From<StoreError> for Status {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidArgument(message) => Status::invalid_argument(message),
            StoreError::NotFound(message) => Status::not_found(message),
            StoreError::FailedPrecondition(message) => Status::failed_precondition(message),
        }
    }
}

#[derive(Debug)]
pub struct TicTacToeServiceImpl {
    store: GameStore,
}

impl TicTacToeServiceImpl {
    pub fn new(store: GameStore) -> Self {
        Self { store }
    }

    /// Negative wire ids can never have been issued.
    fn parse_game_id(game_id: i64) -> Result<GameId, StoreError> {
        GameId::try_from(game_id).map_err(|_| StoreError::game_not_found())
    }
}

fn reject(call: &str, error: StoreError) -> Status {
    log!("{} rejected: {}", call, error);
    error.into()
}

#[tonic::async_trait]
impl TicTacToe for TicTacToeServiceImpl {
    async fn create_game(
        &self,
        _request: Request<proto::CreateGameRequest>,
    ) -> Result<Response<proto::Game>, Status> {
        log!("CreateGame()");

        let game = self.store.create_game().await;
        Ok(Response::new(game.to_proto()))
    }

    async fn get_game(
        &self,
        request: Request<proto::GetGameRequest>,
    ) -> Result<Response<proto::Game>, Status> {
        let game_id = request.into_inner().game_id;
        log!("GetGame(game_id={})", game_id);

        let game_id = Self::parse_game_id(game_id).map_err(|e| reject("GetGame", e))?;
        let game = self
            .store
            .get_game(game_id)
            .await
            .map_err(|e| reject("GetGame", e))?;

        Ok(Response::new(game.to_proto()))
    }

    async fn make_move(
        &self,
        request: Request<proto::MakeMoveRequest>,
    ) -> Result<Response<proto::Game>, Status> {
        let request = request.into_inner();
        let Some(mv) = request.r#move else {
            log!("MakeMove(game_id={}, move=None)", request.game_id);
            return Err(reject(
                "MakeMove",
                StoreError::InvalidArgument("Move is missing".to_string()),
            ));
        };

        let mark = Mark::from_proto(mv.mark);
        log!(
            "MakeMove(game_id={}, move=Move(mark={}, cell={}))",
            request.game_id, mark, mv.cell
        );

        let game_id = Self::parse_game_id(request.game_id).map_err(|e| reject("MakeMove", e))?;
        let game = self
            .store
            .make_move(game_id, mark, mv.cell)
            .await
            .map_err(|e| reject("MakeMove", e))?;

        Ok(Response::new(game.to_proto()))
    }
}
